mod account_receivable;

pub use account_receivable::{
    AccountReceivable, ReceivableFilter, ReceivableResponse, ReceivableStatus,
    UpdateReceivableStatusRequest,
};

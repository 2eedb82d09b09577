mod purchase_backlog;

pub use purchase_backlog::{
    BacklogListQuery, BacklogResponse, BacklogStatus, PurchaseBacklogItem,
    UpdateBacklogStatusRequest,
};

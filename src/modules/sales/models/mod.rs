mod sale;
mod sale_response;

pub use sale::{
    CreateSaleRequest, ItemFulfillmentStatus, PaymentIntent, PaymentIntentRequest, PaymentStatus,
    Sale, SaleFulfillmentStatus, SaleItem, SaleItemRequest, SalePayment,
};
pub use sale_response::{
    SaleItemResponse, SalePaymentResponse, SaleResponse, SalesSummary, SalesSummaryResponse,
};

pub mod request;
pub mod response;

pub use request::{InitThreadRequest, ProcessRequest};
pub use response::{ErrorDetail, IndexIdConfigResponse, InitThreadResponse, ProcessResponse};

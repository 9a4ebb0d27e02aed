pub mod responder;
pub mod utils_functions;
pub mod utils_models;

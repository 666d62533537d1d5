pub mod body;
pub mod error;
pub mod jwt;
pub mod response;
pub mod swagger_doc;
pub mod validation;

// Core modules: model seam, boundary records, string transfer, pipeline, errors.
pub mod error;
pub mod model;
pub mod pipeline;
pub mod record;
pub mod rules;
pub mod transfer;
pub mod view;

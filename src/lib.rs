pub mod extract;
pub mod frequency;
pub mod aggregate;
pub mod report;
pub mod source;
pub mod pipeline;
pub mod context;
pub mod corpus;
pub mod completion;
pub mod blob;
pub mod qa;
pub mod config;

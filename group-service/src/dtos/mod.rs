//! Request/response DTOs for the group service HTTP API.
pub mod groups;

// Query handlers: read-only views over persisted rows

pub mod profile_queries;
pub mod timeline_queries;

// Admin API: read-only listing and resume download.

pub mod handlers;

pub mod get_snap;
pub mod list_snaps;
pub mod resume_snap;

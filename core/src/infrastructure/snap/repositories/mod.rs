pub mod snap_repository;

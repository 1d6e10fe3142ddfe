pub mod pretty;

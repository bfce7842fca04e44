pub mod alternative;

pub mod gaussian;

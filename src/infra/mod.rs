pub mod marketplace;
pub mod tokenbound;

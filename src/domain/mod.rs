pub mod address;
pub mod amount;
pub mod nft;
pub mod refresh;
pub mod transfer;

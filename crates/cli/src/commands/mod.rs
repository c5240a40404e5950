pub mod append;
pub mod inspect;
pub mod migrate;
pub mod verify;

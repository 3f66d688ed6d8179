pub mod userop;
pub mod wallet;

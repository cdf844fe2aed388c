pub mod claim_table;
pub mod image_helper;

pub mod der_name;
pub mod encoding;

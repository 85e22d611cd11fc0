pub mod crud_dialog;
pub mod data_table;
pub mod sequence;

pub mod header;
pub mod help_bar;
pub mod text_input;

pub mod document_list;
pub mod editable_key;

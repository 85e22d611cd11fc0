pub mod a001_document_sequence;

pub mod score_file;

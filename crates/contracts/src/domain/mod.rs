pub mod a001_retail_transaction;

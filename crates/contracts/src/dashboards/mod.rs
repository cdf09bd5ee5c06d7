pub mod d100_customer_insights;

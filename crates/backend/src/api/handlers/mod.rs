// Dashboard handlers (d100)
pub mod d100_customer_insights;

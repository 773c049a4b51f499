pub mod csv_expenses;
pub mod json_request;

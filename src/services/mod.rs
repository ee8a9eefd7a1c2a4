pub mod product_service;

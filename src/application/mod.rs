pub mod screener;

pub mod bar_provider;

pub mod crossovers;
pub mod profit;
pub mod uptrends;

pub use crossovers::CrossoverDetector;
pub use profit::ProfitPotentialAnalyzer;
pub use uptrends::UptrendDetector;

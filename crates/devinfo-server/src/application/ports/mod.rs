pub mod fact_collector;

pub use fact_collector::FactCollectorPort;

//! Outbound adapter for the external label-analysis service.

mod http_gateway;

pub use http_gateway::HttpAnalysisGateway;

pub mod agentdtos;
pub mod authdtos;
pub mod propertydtos;
pub mod sectordtos;

//! Ports of call.

use trawlwatch_domain::{Port, PortId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortsStore {
    ports: Vec<Port>,
}

impl PortsStore {
    /// Replace the whole list
    pub fn set_ports(&mut self, ports: Vec<Port>) {
        self.ports = ports;
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn get(&self, id: PortId) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == id)
    }
}

//! Port anchors.

use super::{IconEntry, IconKind, IconLayer, MapSnapshot, PickTarget};
use crate::palette;
use crate::stores::DataDomain;

pub const PORT_ICON_SIZE: f32 = 16.0;

pub fn derive_ports_layer(snapshot: &MapSnapshot<'_>) -> IconLayer {
    let ports = snapshot.ports.ports();
    IconLayer {
        id: "ports".to_string(),
        visible: !(ports.is_empty() && snapshot.loading.is_loading(DataDomain::Ports)),
        pickable: true,
        icons: ports
            .iter()
            .map(|port| IconEntry {
                position: [port.longitude, port.latitude],
                icon: IconKind::Anchor,
                size: PORT_ICON_SIZE,
                angle: 0.0,
                color: palette::PORT,
                pick: PickTarget::Port { port_id: port.id },
            })
            .collect(),
    }
}

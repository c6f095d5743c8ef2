use crate::devices::{Daq, DeviceEndpoint, GenericDaq, HumiditySetpoint, Mfc, Sensor};

/// Devices keyed by name, in insertion order. The order is the refresh order.
#[derive(Default)]
pub struct DeviceRegistry {
    entries: Vec<(String, Box<dyn Daq>)>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The devices of the humidity rig.
    #[must_use]
    pub fn rig() -> Self {
        let mut registry = Self::new();
        registry.insert("MFC1", Box::new(Mfc::new("MFC1", "/MFC1")));
        registry.insert("MFC2", Box::new(Mfc::new("MFC2", "/MFC2")));
        registry.insert("SHT1", Box::new(Sensor::new("SHT1", "/SHT1", 0x44)));
        registry.insert("SHT2", Box::new(Sensor::new("SHT2", "/SHT2", 0x45)));
        registry.insert("SPT", Box::new(HumiditySetpoint::new("SPT", "/SPT")));
        registry.insert("test1", Box::new(GenericDaq::new("Test1", "/test1")));
        registry.insert("test2", Box::new(GenericDaq::new("Test2", "/test2")));
        registry.insert("test3", Box::new(GenericDaq::new("Test3", "/test3")));
        registry
    }

    /// Add a device, replacing any previous one under `key`.
    pub fn insert(&mut self, key: &str, device: Box<dyn Daq>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = device,
            None => self.entries.push((key.to_string(), device)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&dyn Daq> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, d)| d.as_ref())
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut (dyn Daq + 'static)> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, d)| d.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Daq)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d.as_ref()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut (dyn Daq + 'static))> {
        self.entries.iter_mut().map(|(k, d)| (k.as_str(), d.as_mut()))
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Owned copy of every endpoint, for I/O done outside the dashboard lock.
    #[must_use]
    pub fn endpoints(&self) -> Vec<(String, DeviceEndpoint)> {
        self.entries
            .iter()
            .map(|(k, d)| (k.clone(), d.endpoint().clone()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

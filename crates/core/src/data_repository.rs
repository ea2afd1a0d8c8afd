use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::domain::{FuelType, ModuleInfo};
use crate::error::{CoreError, Result};
use crate::lookup::Lookup;

/// Vehicle-level facts collected at the start of the test.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehicleInformation {
    #[serde(default)]
    pub vin: String,
    #[serde(default)]
    pub fuel_type: FuelType,
    #[serde(default)]
    pub engine_model_year: Option<u16>,
}

#[derive(Default)]
struct RepositoryInner {
    modules: BTreeMap<u8, ModuleInfo>,
    vehicle: Option<VehicleInformation>,
}

/// Registry of the OBD modules found on the vehicle.
///
/// Cheap to clone; clones share the same registry. Populated before the
/// validators run and only read while they do.
#[derive(Clone, Default)]
pub struct DataRepository {
    inner: Arc<RwLock<RepositoryInner>>,
}

impl DataRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RepositoryInner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RepositoryInner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a module, replacing any previous entry for its address.
    pub fn put_module(&self, info: ModuleInfo) {
        debug!(
            source_address = info.source_address,
            supported_spns = info.supported_spns.len(),
            "Module registered"
        );
        self.write().modules.insert(info.source_address, info);
    }

    pub fn module(&self, source_address: u8) -> Option<ModuleInfo> {
        self.read().modules.get(&source_address).cloned()
    }

    pub fn require_module(&self, source_address: u8) -> Result<ModuleInfo> {
        self.module(source_address)
            .ok_or(CoreError::ModuleNotFound(source_address))
    }

    /// Registered modules in ascending address order.
    pub fn modules(&self) -> Vec<ModuleInfo> {
        self.read().modules.values().cloned().collect()
    }

    pub fn is_obd_module(&self, source_address: u8) -> bool {
        self.read().modules.contains_key(&source_address)
    }

    pub fn obd_module_addresses(&self) -> Vec<u8> {
        self.read().modules.keys().copied().collect()
    }

    /// Registered name, else the standard address name.
    pub fn module_name(&self, source_address: u8) -> String {
        match self.read().modules.get(&source_address) {
            Some(info) => info.module_name(),
            None => Lookup::address_name(source_address).to_string(),
        }
    }

    /// Data stream identifiers declared by the module at `source_address`.
    pub fn supported_spns(&self, source_address: u8) -> Vec<u32> {
        self.read()
            .modules
            .get(&source_address)
            .map(ModuleInfo::data_stream_spns)
            .unwrap_or_default()
    }

    pub fn set_vehicle_information(&self, vehicle: VehicleInformation) {
        self.write().vehicle = Some(vehicle);
    }

    pub fn vehicle_information(&self) -> Option<VehicleInformation> {
        self.read().vehicle.clone()
    }

    /// Fuel type from the vehicle information, diesel when not yet known.
    pub fn fuel_type(&self) -> FuelType {
        self.read()
            .vehicle
            .as_ref()
            .map(|v| v.fuel_type)
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        let mut inner = self.write();
        inner.modules.clear();
        inner.vehicle = None;
    }
}

impl std::fmt::Debug for DataRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("DataRepository")
            .field("modules", &inner.modules.len())
            .field("vehicle", &inner.vehicle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SupportedSpn;

    #[test]
    fn test_put_and_lookup_module() {
        let repo = DataRepository::new();
        repo.put_module(
            ModuleInfo::new(0x00)
                .with_supported_spns(vec![SupportedSpn::data_stream(190), SupportedSpn::data_stream(92)]),
        );

        assert!(repo.is_obd_module(0x00));
        assert!(!repo.is_obd_module(0x17));
        assert_eq!(repo.supported_spns(0x00), vec![92, 190]);
        assert!(repo.supported_spns(0x17).is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let repo = DataRepository::new();
        let other = repo.clone();
        other.put_module(ModuleInfo::new(0x3D));
        assert_eq!(repo.obd_module_addresses(), vec![0x3D]);
    }

    #[test]
    fn test_module_name_resolution() {
        let repo = DataRepository::new();
        repo.put_module(ModuleInfo::new(0x01).with_name("Aftertreatment ECU"));

        assert_eq!(repo.module_name(0x01), "Aftertreatment ECU");
        assert_eq!(repo.module_name(0x00), "Engine #1");
        assert_eq!(repo.module_name(0x99), "Unknown");
    }

    #[test]
    fn test_require_module_missing() {
        let repo = DataRepository::new();
        let err = repo.require_module(0x21).unwrap_err();
        assert!(matches!(err, CoreError::ModuleNotFound(0x21)));
    }

    #[test]
    fn test_fuel_type_defaults_to_diesel() {
        let repo = DataRepository::new();
        assert_eq!(repo.fuel_type(), FuelType::Diesel);

        repo.set_vehicle_information(VehicleInformation {
            fuel_type: FuelType::Cng,
            ..Default::default()
        });
        assert_eq!(repo.fuel_type(), FuelType::Cng);

        repo.clear();
        assert!(repo.vehicle_information().is_none());
        assert!(repo.modules().is_empty());
    }
}

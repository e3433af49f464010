//! ## parkhaus-core::lot
//! **The allocation manager**
//!
//! `ParkingLot` owns every level, slot and active ticket. All of it sits
//! behind one coarse `parking_lot::Mutex`, so `park_vehicle` (find, occupy,
//! register) and `unpark_vehicle` (verify, close, bill, release) each run as a
//! single critical section. Share the lot between threads with `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::ParkingError;
use crate::fee::{FeePolicy, HourlyFee};
use crate::ids::{Id, IdGenerator};
use crate::model::{Level, Receipt, Slot, SlotLocation, Ticket, Vehicle, VehicleType};
use crate::strategy::{NearestFirst, SlotStrategy};
use crate::time::{Clock, SystemClock};

// Lot identities are unique per process, independent of any IdGenerator.
static NEXT_LOT_ID: AtomicU64 = AtomicU64::new(1);

struct LotState {
    levels: BTreeMap<Id, Level>,
    // Keyed by plate: one active session per vehicle.
    active: HashMap<String, Ticket>,
    strategy: Box<dyn SlotStrategy>,
    fee_policy: Box<dyn FeePolicy>,
}

impl LotState {
    fn slot_mut(&mut self, location: SlotLocation) -> Result<&mut Slot, ParkingError> {
        self.levels
            .get_mut(&location.level_id)
            .and_then(|level| level.slot_mut(location.slot_id))
            .ok_or_else(|| {
                ParkingError::InvalidState(format!(
                    "slot {} on level {} does not belong to this lot",
                    location.slot_id, location.level_id
                ))
            })
    }
}

/// Free and total slot counts for one vehicle type on one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelAvailability {
    pub level_id: Id,
    pub level_name: String,
    pub vehicle_type: VehicleType,
    pub free: usize,
    pub capacity: usize,
}

/// Thread-safe parking lot.
pub struct ParkingLot {
    lot_id: Id,
    ids: Arc<IdGenerator>,
    clock: Arc<dyn Clock>,
    state: Mutex<LotState>,
}

impl ParkingLot {
    /// Creates an empty lot using nearest-first allocation, the default
    /// hourly rates and the system clock.
    pub fn new(ids: Arc<IdGenerator>) -> Self {
        Self {
            lot_id: NEXT_LOT_ID.fetch_add(1, Ordering::Relaxed),
            ids,
            clock: Arc::new(SystemClock),
            state: Mutex::new(LotState {
                levels: BTreeMap::new(),
                active: HashMap::new(),
                strategy: Box::new(NearestFirst),
                fee_policy: Box::new(HourlyFee::default()),
            }),
        }
    }

    pub fn with_strategy(self, strategy: impl SlotStrategy + 'static) -> Self {
        self.set_strategy(Box::new(strategy));
        self
    }

    pub fn with_fee_policy(self, fee_policy: impl FeePolicy + 'static) -> Self {
        self.set_fee_policy(Box::new(fee_policy));
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Swaps the slot-selection strategy. Takes effect for the next park.
    pub fn set_strategy(&self, strategy: Box<dyn SlotStrategy>) {
        let mut state = self.state.lock();
        debug!(from = state.strategy.name(), to = strategy.name(), "switching strategy");
        state.strategy = strategy;
    }

    /// Swaps the fee policy. Takes effect for the next unpark.
    pub fn set_fee_policy(&self, fee_policy: Box<dyn FeePolicy>) {
        let mut state = self.state.lock();
        debug!(from = state.fee_policy.name(), to = fee_policy.name(), "switching fee policy");
        state.fee_policy = fee_policy;
    }

    /// Process-unique identity stamped on every ticket this lot issues.
    pub fn lot_id(&self) -> Id {
        self.lot_id
    }

    /// The generator this lot draws ticket ids from.
    pub fn ids(&self) -> &Arc<IdGenerator> {
        &self.ids
    }

    /// Registers a level. Intended for setup, before traffic starts.
    pub fn add_level(&self, level: Level) -> Result<(), ParkingError> {
        let mut state = self.state.lock();
        if state.levels.contains_key(&level.id()) {
            return Err(ParkingError::InvalidState(format!(
                "level {} is already part of the lot",
                level.id()
            )));
        }
        if let Some(slot) = level.slots().find(|slot| {
            state
                .levels
                .values()
                .any(|existing| existing.slot(slot.id()).is_some())
        }) {
            return Err(ParkingError::InvalidState(format!(
                "slot {} is already part of the lot",
                slot.id()
            )));
        }

        info!(
            level_id = level.id(),
            name = level.name(),
            slots = level.len(),
            "level added"
        );
        state.levels.insert(level.id(), level);
        Ok(())
    }

    /// Assigns a free slot to `vehicle` and opens a ticket.
    ///
    /// Fails with [`ParkingError::DuplicatePlate`] if the plate is already
    /// parked and [`ParkingError::NoAvailability`] if no slot of its type is
    /// free. Neither failure changes any state.
    pub fn park_vehicle(&self, vehicle: Vehicle) -> Result<Ticket, ParkingError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if state.active.contains_key(vehicle.plate()) {
            warn!(plate = vehicle.plate(), "plate already parked");
            return Err(ParkingError::DuplicatePlate {
                plate: vehicle.plate().to_string(),
            });
        }

        let Some(location) = state.strategy.find_slot(&state.levels, &vehicle) else {
            debug!(
                plate = vehicle.plate(),
                vehicle_type = %vehicle.vehicle_type(),
                "no slot available"
            );
            return Err(ParkingError::NoAvailability {
                vehicle_type: vehicle.vehicle_type(),
            });
        };

        let strategy = state.strategy.name();
        let slot = state.slot_mut(location)?;
        if !slot.accepts(vehicle.vehicle_type()) {
            return Err(ParkingError::InvalidState(format!(
                "strategy '{}' offered slot {} which cannot take a {}",
                strategy,
                location.slot_id,
                vehicle.vehicle_type()
            )));
        }
        slot.occupy();

        let ticket = Ticket::open(
            &self.ids,
            self.lot_id,
            location,
            vehicle,
            self.clock.now(),
        );
        info!(
            ticket_id = ticket.id(),
            plate = ticket.vehicle().plate(),
            level_id = location.level_id,
            slot_id = location.slot_id,
            "vehicle parked"
        );
        state
            .active
            .insert(ticket.vehicle().plate().to_string(), ticket.clone());
        Ok(ticket)
    }

    /// Closes an active ticket, bills it and frees its slot.
    ///
    /// The ticket must have been issued by this lot and be exactly the one
    /// currently registered for its plate, else [`ParkingError::UnknownTicket`]. If the fee policy refuses the ticket
    /// (for example a clock anomaly under the reject policy) the session
    /// stays active and nothing changes.
    pub fn unpark_vehicle(&self, ticket: &Ticket) -> Result<Receipt, ParkingError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let plate = ticket.vehicle().plate();

        let mut closed = match state.active.get(plate) {
            Some(active) if ticket.lot_id() == self.lot_id && active == ticket => {
                active.clone()
            }
            _ => {
                warn!(ticket_id = ticket.id(), plate, "unpark of inactive ticket");
                return Err(ParkingError::UnknownTicket {
                    ticket_id: ticket.id(),
                    plate: plate.to_string(),
                });
            }
        };

        closed.close(self.clock.now())?;
        let fee = state.fee_policy.fee(&closed)?;

        state.slot_mut(closed.location())?.release();
        state.active.remove(plate);

        info!(
            ticket_id = closed.id(),
            plate,
            fee,
            minutes = closed.duration().map(|d| d.num_minutes()),
            "vehicle unparked"
        );
        Ok(Receipt {
            ticket: closed,
            fee,
        })
    }

    /// The open ticket for `plate`, if any.
    pub fn active_ticket(&self, plate: &str) -> Option<Ticket> {
        self.state.lock().active.get(plate).cloned()
    }

    pub fn active_count(&self) -> usize {
        self.state.lock().active.len()
    }

    /// Free slots of `vehicle_type` across all levels.
    pub fn free_slots(&self, vehicle_type: VehicleType) -> usize {
        self.state
            .lock()
            .levels
            .values()
            .map(|level| level.free_count(vehicle_type))
            .sum()
    }

    /// Per-level, per-type occupancy; levels in id order.
    pub fn availability(&self) -> Vec<LevelAvailability> {
        let state = self.state.lock();
        state
            .levels
            .values()
            .flat_map(|level| {
                VehicleType::ALL.into_iter().map(move |kind| LevelAvailability {
                    level_id: level.id(),
                    level_name: level.name().to_string(),
                    vehicle_type: kind,
                    free: level.free_count(kind),
                    capacity: level.capacity(kind),
                })
            })
            .collect()
    }

    /// Snapshot of every level, in id order.
    pub fn levels(&self) -> Vec<Level> {
        self.state.lock().levels.values().cloned().collect()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.state.lock().strategy.name()
    }

    pub fn fee_policy_name(&self) -> &'static str {
        self.state.lock().fee_policy.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fee::{ClockAnomalyPolicy, RateTable};
    use crate::strategy::LevelBalanced;
    use crate::time::ManualClock;
    use std::sync::Barrier;

    fn lot_with(layout: &[(usize, usize, usize)]) -> (ParkingLot, ManualClock) {
        let ids = Arc::new(IdGenerator::new());
        let clock = ManualClock::at_epoch();
        let lot = ParkingLot::new(Arc::clone(&ids)).with_clock(Arc::new(clock.clone()));
        for (i, &(cars, bikes, trucks)) in layout.iter().enumerate() {
            lot.add_level(Level::with_counts(&ids, format!("L{i}"), cars, bikes, trucks))
                .unwrap();
        }
        (lot, clock)
    }

    fn vehicle(lot: &ParkingLot, kind: VehicleType, plate: &str) -> Vehicle {
        Vehicle::new(lot.ids(), kind, plate)
    }

    #[test]
    fn end_to_end_single_level() {
        let (lot, clock) = lot_with(&[(1, 1, 0)]);

        let a = lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();
        let _b = lot.park_vehicle(vehicle(&lot, VehicleType::Bike, "B1")).unwrap();
        assert!(matches!(
            lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C2")),
            Err(ParkingError::NoAvailability {
                vehicle_type: VehicleType::Car
            })
        ));

        clock.advance_minutes(15);
        let receipt = lot.unpark_vehicle(&a).unwrap();
        assert!(receipt.fee >= 50.0);
        assert!(receipt.ticket.is_closed());

        let c2 = lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C2")).unwrap();
        assert_eq!(c2.location(), a.location());
    }

    #[test]
    fn parked_slot_matches_vehicle_type() {
        let (lot, _) = lot_with(&[(1, 1, 1), (1, 1, 1)]);
        for (kind, plate) in [
            (VehicleType::Truck, "T1"),
            (VehicleType::Bike, "B1"),
            (VehicleType::Car, "C1"),
        ] {
            let ticket = lot.park_vehicle(vehicle(&lot, kind, plate)).unwrap();
            let location = ticket.location();
            let level = lot
                .levels()
                .into_iter()
                .find(|level| level.id() == location.level_id)
                .unwrap();
            let slot = level.slot(location.slot_id).unwrap();
            assert_eq!(slot.vehicle_type(), kind);
            assert!(!slot.is_available());
        }
    }

    #[test]
    fn no_availability_leaves_state_untouched() {
        let (lot, _) = lot_with(&[(2, 2, 0)]);
        lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();
        let before = lot.levels();

        let err = lot
            .park_vehicle(vehicle(&lot, VehicleType::Truck, "T1"))
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(lot.levels(), before);
        assert_eq!(lot.active_count(), 1);
        assert!(lot.active_ticket("T1").is_none());
    }

    #[test]
    fn duplicate_plate_is_rejected() {
        let (lot, _) = lot_with(&[(2, 0, 0)]);
        lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();
        let err = lot
            .park_vehicle(vehicle(&lot, VehicleType::Car, "C1"))
            .unwrap_err();
        assert_eq!(
            err,
            ParkingError::DuplicatePlate {
                plate: "C1".into()
            }
        );
        assert_eq!(lot.free_slots(VehicleType::Car), 1);
    }

    #[test]
    fn double_unpark_is_unknown_ticket() {
        let (lot, _) = lot_with(&[(1, 0, 0)]);
        let ticket = lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();
        lot.unpark_vehicle(&ticket).unwrap();
        assert!(matches!(
            lot.unpark_vehicle(&ticket),
            Err(ParkingError::UnknownTicket { .. })
        ));
        assert_eq!(lot.free_slots(VehicleType::Car), 1);
    }

    #[test]
    fn foreign_ticket_is_unknown() {
        let (lot, _) = lot_with(&[(1, 0, 0)]);
        let (other, _) = lot_with(&[(1, 0, 0)]);
        let mine = lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();
        let foreign = other
            .park_vehicle(vehicle(&other, VehicleType::Car, "C1"))
            .unwrap();
        // Identically built lots hand out identical ids, slots and times.
        assert_eq!(mine.id(), foreign.id());
        assert_eq!(mine.location(), foreign.location());
        assert_ne!(mine.lot_id(), foreign.lot_id());

        let err = lot.unpark_vehicle(&foreign).unwrap_err();
        assert_eq!(err.reason(), "unknown_ticket");
        assert_eq!(lot.active_count(), 1);
        assert_eq!(lot.free_slots(VehicleType::Car), 0);
        assert_eq!(lot.active_ticket("C1"), Some(mine.clone()));

        assert_eq!(lot.unpark_vehicle(&mine).unwrap().fee, 50.0);
        assert_eq!(other.unpark_vehicle(&foreign).unwrap().fee, 50.0);
    }

    #[test]
    fn stale_ticket_for_reparked_plate_is_unknown() {
        let (lot, _) = lot_with(&[(1, 0, 0)]);
        let first = lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();
        lot.unpark_vehicle(&first).unwrap();
        let second = lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();

        assert!(lot.unpark_vehicle(&first).is_err());
        assert_eq!(lot.active_ticket("C1").map(|t| t.id()), Some(second.id()));
    }

    #[test]
    fn fee_follows_elapsed_manual_time() {
        let (lot, clock) = lot_with(&[(1, 0, 1)]);
        let car = lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();
        let truck = lot.park_vehicle(vehicle(&lot, VehicleType::Truck, "T1")).unwrap();

        clock.advance_minutes(1);
        assert_eq!(lot.unpark_vehicle(&truck).unwrap().fee, 100.0);

        clock.advance_minutes(60);
        let receipt = lot.unpark_vehicle(&car).unwrap();
        assert_eq!(receipt.duration(), Some(chrono::TimeDelta::minutes(61)));
        assert_eq!(receipt.fee, 100.0);
    }

    #[test]
    fn rejected_clock_anomaly_keeps_session_active() {
        let (lot, clock) = lot_with(&[(1, 0, 0)]);
        lot.set_fee_policy(Box::new(HourlyFee::new(
            RateTable::default(),
            ClockAnomalyPolicy::Reject,
        )));
        let ticket = lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();

        clock.advance_minutes(-10);
        assert!(matches!(
            lot.unpark_vehicle(&ticket),
            Err(ParkingError::ClockAnomaly { .. })
        ));
        assert_eq!(lot.active_count(), 1);
        assert_eq!(lot.free_slots(VehicleType::Car), 0);

        clock.advance_minutes(30);
        assert_eq!(lot.unpark_vehicle(&ticket).unwrap().fee, 50.0);
    }

    #[test]
    fn floored_clock_anomaly_bills_one_hour() {
        let (lot, clock) = lot_with(&[(0, 1, 0)]);
        let ticket = lot.park_vehicle(vehicle(&lot, VehicleType::Bike, "B1")).unwrap();
        clock.advance_minutes(-10);
        assert_eq!(lot.unpark_vehicle(&ticket).unwrap().fee, 20.0);
    }

    #[test]
    fn add_level_rejects_duplicates() {
        let ids = Arc::new(IdGenerator::new());
        let lot = ParkingLot::new(Arc::clone(&ids));
        let level = Level::with_counts(&ids, "L0", 1, 0, 0);
        lot.add_level(level.clone()).unwrap();
        assert!(matches!(
            lot.add_level(level.clone()),
            Err(ParkingError::InvalidState(_))
        ));

        let reused_slots = Level::new(&ids, "L1", level.slots().cloned()).unwrap();
        assert!(matches!(
            lot.add_level(reused_slots),
            Err(ParkingError::InvalidState(_))
        ));
        assert_eq!(lot.levels().len(), 1);
    }

    #[test]
    fn strategy_can_be_swapped() {
        let (lot, _) = lot_with(&[(2, 0, 0), (2, 0, 0)]);
        let first = lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();

        let lot = lot.with_strategy(LevelBalanced);
        assert_eq!(lot.strategy_name(), "balanced");
        let second = lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C2")).unwrap();
        assert_ne!(first.location().level_id, second.location().level_id);
    }

    #[test]
    fn availability_reports_every_type_per_level() {
        let (lot, _) = lot_with(&[(2, 1, 0)]);
        lot.park_vehicle(vehicle(&lot, VehicleType::Car, "C1")).unwrap();

        let report = lot.availability();
        assert_eq!(report.len(), 3);
        let cars = report
            .iter()
            .find(|row| row.vehicle_type == VehicleType::Car)
            .unwrap();
        assert_eq!((cars.free, cars.capacity), (1, 2));
    }

    #[test]
    fn concurrent_parks_never_double_book() {
        const THREADS: usize = 16;
        let (lot, _) = lot_with(&[(1, 4, 0)]);
        let lot = Arc::new(lot);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let lot = Arc::clone(&lot);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    let car = Vehicle::new(lot.ids(), VehicleType::Car, format!("C{i}"));
                    barrier.wait();
                    lot.park_vehicle(car)
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let parked = results.iter().filter(|r| r.is_ok()).count();
        let full = results
            .iter()
            .filter(|r| matches!(r, Err(ParkingError::NoAvailability { .. })))
            .count();
        assert_eq!(parked, 1);
        assert_eq!(full, THREADS - 1);
        assert_eq!(lot.active_count(), 1);
    }

    #[test]
    fn concurrent_churn_keeps_books_balanced() {
        let (lot, _) = lot_with(&[(3, 3, 3), (3, 3, 3)]);
        let lot = Arc::new(lot);

        std::thread::scope(|scope| {
            for t in 0..8 {
                let lot = Arc::clone(&lot);
                scope.spawn(move || {
                    for i in 0..200 {
                        let kind = VehicleType::ALL[(t + i) % 3];
                        let car = Vehicle::new(lot.ids(), kind, format!("T{t}-{i}"));
                        if let Ok(ticket) = lot.park_vehicle(car) {
                            lot.unpark_vehicle(&ticket).unwrap();
                        }
                    }
                });
            }
        });

        assert_eq!(lot.active_count(), 0);
        for kind in VehicleType::ALL {
            assert_eq!(lot.free_slots(kind), 6);
        }
    }
}

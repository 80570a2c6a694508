use serde::{Deserialize, Serialize};

use crate::model::{Field, Id};

/// A room reservation ("reserva") for a management-owned class group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(rename = "sala")]
    pub room: String,
    /// Kept as the client sent it (`YYYY-MM-DD` by convention).
    #[serde(rename = "data_reserva")]
    pub reservation_date: String,
    #[serde(rename = "turma_id")]
    pub class_group_id: Id,
}

impl Reservation {
    pub fn new(room: impl Into<String>, reservation_date: impl Into<String>, class_group_id: Id) -> Self {
        Self {
            room: room.into(),
            reservation_date: reservation_date.into(),
            class_group_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationPatch {
    #[serde(default, rename = "sala")]
    pub room: Field<String>,
    #[serde(default, rename = "data_reserva")]
    pub reservation_date: Field<String>,
    #[serde(default, rename = "turma_id")]
    pub class_group_id: Field<Id>,
}

impl ReservationPatch {
    pub fn apply(self, reservation: &mut Reservation) {
        self.room.assign_to(&mut reservation.room);
        self.reservation_date.assign_to(&mut reservation.reservation_date);
        self.class_group_id.assign_to(&mut reservation.class_group_id);
    }
}

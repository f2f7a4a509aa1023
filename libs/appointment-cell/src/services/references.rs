use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_database::{DatabaseError, SupabaseClient};

#[derive(Debug, Deserialize)]
struct ReferenceList {
    #[serde(default)]
    appointments: Vec<Uuid>,
}

/// Owner tables that keep an `appointments` id list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Doctor,
    Patient,
}

impl Owner {
    pub fn table(&self) -> &'static str {
        match self {
            Owner::Doctor => "doctors",
            Owner::Patient => "patients",
        }
    }
}

async fn read_list(
    supabase: &SupabaseClient,
    owner: Owner,
    owner_id: Uuid,
) -> Result<Option<Vec<Uuid>>, DatabaseError> {
    let query = format!("id=eq.{}&select=appointments", owner_id);
    let mut rows: Vec<ReferenceList> = supabase.select(owner.table(), &query).await?;
    Ok(rows.pop().map(|row| row.appointments))
}

async fn write_list(
    supabase: &SupabaseClient,
    owner: Owner,
    owner_id: Uuid,
    appointments: Vec<Uuid>,
) -> Result<(), DatabaseError> {
    let filter = format!("id=eq.{}", owner_id);
    let _: Vec<serde_json::Value> = supabase
        .update(owner.table(), &filter, json!({ "appointments": appointments }))
        .await?;
    Ok(())
}

/// Appends `appointment_id` to the owner's list. Read-then-write, so not
/// atomic with respect to other writers. Returns false when the owner is gone.
pub async fn push(
    supabase: &SupabaseClient,
    owner: Owner,
    owner_id: Uuid,
    appointment_id: Uuid,
) -> Result<bool, DatabaseError> {
    let Some(mut appointments) = read_list(supabase, owner, owner_id).await? else {
        warn!("{:?} {} vanished before appointment {} could be linked", owner, owner_id, appointment_id);
        return Ok(false);
    };

    if !appointments.contains(&appointment_id) {
        appointments.push(appointment_id);
    }
    write_list(supabase, owner, owner_id, appointments).await?;

    debug!("Linked appointment {} to {:?} {}", appointment_id, owner, owner_id);
    Ok(true)
}

/// Removes every occurrence of `appointment_id` from the owner's list.
pub async fn pull(
    supabase: &SupabaseClient,
    owner: Owner,
    owner_id: Uuid,
    appointment_id: Uuid,
) -> Result<bool, DatabaseError> {
    let Some(mut appointments) = read_list(supabase, owner, owner_id).await? else {
        warn!("{:?} {} not found while unlinking appointment {}", owner, owner_id, appointment_id);
        return Ok(false);
    };

    appointments.retain(|id| *id != appointment_id);
    write_list(supabase, owner, owner_id, appointments).await?;

    debug!("Unlinked appointment {} from {:?} {}", appointment_id, owner, owner_id);
    Ok(true)
}

//! Direct-junction reconciliation
//!
//! A direct junction splices two roads without a connecting road. Each of its
//! connections is rewritten into a plain road-to-road link on the boundary
//! rows of the incoming and linked roads, so graph construction never sees the
//! junction at all.

use log::{debug, info, warn};

use crate::tables::{ContactPoint, JunctionType, LaneKey, RowHandle, RowTables};

/// One connection resolved to the two rows it rewrites
struct Splice {
    incoming: RowHandle,
    linked: RowHandle,
    /// Linked row is section 0, so its predecessor lane link is free to rewrite
    linked_is_first: bool,
    incoming_road: i32,
    linked_road: i32,
    contact: ContactPoint,
    from_lane: i32,
    to_lane: i32,
}

/// Rewrite every direct-junction connection; returns how many were applied
pub fn reconcile(tables: &mut RowTables) -> usize {
    // Snapshot the (incoming, linked) pairs before touching any row
    let splices: Vec<Splice> = tables
        .junctions
        .of_type(JunctionType::Direct)
        .filter_map(|conn| {
            let Some(incoming) = tables.lanes.last_section(conn.incoming_road, conn.from_lane)
            else {
                debug!(
                    "Direct junction {}: no row for incoming road {} lane {}",
                    conn.junction, conn.incoming_road, conn.from_lane
                );
                return None;
            };
            if !tables
                .lanes
                .get(incoming)
                .is_some_and(|row| row.has_succ_junction())
            {
                debug!(
                    "Direct junction {}: incoming road {} does not end in a junction",
                    conn.junction, conn.incoming_road
                );
            }

            let linked = match conn.contact {
                ContactPoint::Start => tables
                    .lanes
                    .find(LaneKey::new(conn.linked_road, conn.to_lane, 0)),
                ContactPoint::End => tables.lanes.last_section(conn.linked_road, conn.to_lane),
                ContactPoint::Unknown => {
                    warn!(
                        "Direct junction {} connection {} has no contact point, skipping",
                        conn.junction, conn.connection
                    );
                    return None;
                }
            };
            let Some(linked) = linked else {
                debug!(
                    "Direct junction {}: no row for linked road {} lane {}",
                    conn.junction, conn.linked_road, conn.to_lane
                );
                return None;
            };
            let linked_row = tables.lanes.get(linked);
            let meets_junction = linked_row.is_some_and(|row| match conn.contact {
                ContactPoint::Start => row.has_pred_junction(),
                _ => row.has_succ_junction(),
            });
            if !meets_junction {
                debug!(
                    "Direct junction {}: linked road {} does not {} in a junction",
                    conn.junction,
                    conn.linked_road,
                    if conn.contact == ContactPoint::Start { "start" } else { "end" }
                );
            }
            let linked_is_first = linked_row.is_some_and(|row| row.is_first_section());

            Some(Splice {
                incoming,
                linked,
                linked_is_first,
                incoming_road: conn.incoming_road,
                linked_road: conn.linked_road,
                contact: conn.contact,
                from_lane: conn.from_lane,
                to_lane: conn.to_lane,
            })
        })
        .collect();

    for splice in &splices {
        if let Some(successor) = tables.lanes.successor_mut(splice.incoming) {
            successor.retarget(splice.linked_road, splice.contact, splice.to_lane);
        }
        // The incoming road always meets the junction with its end. On a later
        // section the lane link still chains the earlier sections of the road.
        if let Some(predecessor) = tables.lanes.predecessor_mut(splice.linked) {
            if splice.linked_is_first {
                predecessor.retarget(splice.incoming_road, ContactPoint::End, splice.from_lane);
            } else {
                predecessor.point_at(splice.incoming_road, ContactPoint::End);
            }
        }
    }

    info!("Reconciled {} direct-junction lane links", splices.len());
    splices.len()
}

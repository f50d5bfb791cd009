//! C ABI for the fire spread simulation.
//!
//! Lets a game server written in another language host the simulation:
//! create an instance, mirror its chunks and block edits into it, tick it
//! once per server tick and read region burn progress back.
//!
//! Every entry point returns a `FireSpreadErrorCode`; details of the last
//! failure on the calling thread are available from
//! `fire_spread_get_last_error`. Nothing panics across the boundary.

mod error;
mod helpers;
mod instance;
mod regions;
mod simulation;
mod world;

pub use error::{fire_spread_get_last_error, fire_spread_get_last_error_code, FireSpreadErrorCode};
pub use instance::{
    fire_spread_destroy, fire_spread_new, fire_spread_new_with_config, FireSpreadInstance,
};
pub use regions::{
    fire_spread_flammable_blocks_remaining, fire_spread_load_regions_json,
    fire_spread_region_count, fire_spread_region_proportion_burned,
};
pub use simulation::{fire_spread_tick, FireSpreadStats};
pub use world::{
    fire_spread_extinguish_within, fire_spread_get_block, fire_spread_ignite,
    fire_spread_load_chunk, fire_spread_place_fire, fire_spread_set_block,
    fire_spread_unload_chunk,
};

#[cfg(test)]
mod tests {
    use super::*;
    use fire_spread_core::BlockType;
    use std::ffi::{CStr, CString};
    use std::ptr;

    fn new_instance() -> *mut FireSpreadInstance {
        let mut sim = ptr::null_mut();
        assert_eq!(unsafe { fire_spread_new(7, &mut sim) }, FireSpreadErrorCode::Ok);
        assert!(!sim.is_null());
        sim
    }

    #[test]
    fn test_null_pointers_are_reported() {
        assert_eq!(
            unsafe { fire_spread_new(1, ptr::null_mut()) },
            FireSpreadErrorCode::NullPointer
        );
        assert_eq!(fire_spread_get_last_error_code(), FireSpreadErrorCode::NullPointer);
        let message = unsafe { CStr::from_ptr(fire_spread_get_last_error()) };
        assert!(message.to_str().unwrap().contains("out_instance"));

        assert_eq!(
            unsafe { fire_spread_tick(ptr::null(), ptr::null_mut()) },
            FireSpreadErrorCode::NullPointer
        );
        unsafe { fire_spread_destroy(ptr::null_mut()) };
    }

    #[test]
    fn test_blocks_and_fire_round_trip() {
        let sim = new_instance();
        unsafe {
            assert_eq!(fire_spread_load_chunk(sim, 0, 0, 0), FireSpreadErrorCode::Ok);
            assert_eq!(
                fire_spread_set_block(sim, 4, 0, 4, BlockType::Stone.as_u8()),
                FireSpreadErrorCode::Ok
            );
            assert_eq!(
                fire_spread_set_block(sim, 4, 0, 4, 250),
                FireSpreadErrorCode::InvalidParameter
            );
            assert_eq!(
                fire_spread_set_block(sim, 40, 0, 4, BlockType::Stone.as_u8()),
                FireSpreadErrorCode::ChunkNotLoaded
            );

            let mut ignited = false;
            assert_eq!(fire_spread_ignite(sim, 4, 1, 4, &mut ignited), FireSpreadErrorCode::Ok);
            assert!(ignited);
            assert!(fire_spread_get_last_error().is_null());

            let mut block = 0;
            assert_eq!(fire_spread_get_block(sim, 4, 1, 4, &mut block), FireSpreadErrorCode::Ok);
            assert_eq!(BlockType::from_u8(block), Some(BlockType::Fire));

            let mut placed = true;
            assert_eq!(fire_spread_place_fire(sim, 9, 9, 9, &mut placed), FireSpreadErrorCode::Ok);
            assert!(!placed);

            let mut count = 0;
            assert_eq!(
                fire_spread_extinguish_within(sim, 4, 1, 4, 1, &mut count),
                FireSpreadErrorCode::Ok
            );
            assert_eq!(count, 1);

            fire_spread_destroy(sim);
        }
    }

    #[test]
    fn test_extinguish_within_huge_radius_keeps_instance_usable() {
        let sim = new_instance();
        unsafe {
            fire_spread_load_chunk(sim, 0, 0, 0);
            fire_spread_set_block(sim, 2, 0, 2, BlockType::Stone.as_u8());
            fire_spread_set_block(sim, 5, 0, 5, BlockType::Stone.as_u8());

            for radius in [1u32 << 31, u32::MAX] {
                let mut ignited = false;
                fire_spread_ignite(sim, 2, 1, 2, &mut ignited);
                fire_spread_ignite(sim, 5, 1, 5, &mut ignited);

                let mut count = 0;
                assert_eq!(
                    fire_spread_extinguish_within(sim, 0, 0, 0, radius, &mut count),
                    FireSpreadErrorCode::Ok
                );
                assert_eq!(count, 2);
                assert_eq!(fire_spread_tick(sim, ptr::null_mut()), FireSpreadErrorCode::Ok);
            }

            fire_spread_destroy(sim);
        }
    }

    #[test]
    fn test_region_progress() {
        let sim = new_instance();
        let json = CString::new(
            r#"{ "stage1": [ { "name": "Shed", "start": [0, 0, 0], "end": [1, 0, 0] } ] }"#,
        )
        .unwrap();
        let key = CString::new("stage1").unwrap();

        unsafe {
            fire_spread_load_chunk(sim, 0, 0, 0);
            fire_spread_set_block(sim, 0, 0, 0, BlockType::OakPlanks.as_u8());
            fire_spread_set_block(sim, 1, 0, 0, BlockType::OakPlanks.as_u8());

            let mut loaded = 0;
            assert_eq!(
                fire_spread_load_regions_json(sim, json.as_ptr(), key.as_ptr(), &mut loaded),
                FireSpreadErrorCode::Ok
            );
            assert_eq!(loaded, 1);

            let mut remaining = 0;
            fire_spread_flammable_blocks_remaining(sim, &mut remaining);
            assert_eq!(remaining, -1);

            let mut stats = FireSpreadStats::default();
            for _ in 0..20 {
                assert_eq!(fire_spread_tick(sim, &mut stats), FireSpreadErrorCode::Ok);
            }
            assert_eq!(stats.world_age, 20);
            assert_eq!(stats.flammable_blocks_remaining, 2);

            let mut count = 0;
            fire_spread_region_count(sim, &mut count);
            assert_eq!(count, 1);

            let mut proportion = -1.0;
            let mut burned = true;
            assert_eq!(
                fire_spread_region_proportion_burned(sim, 0, &mut proportion, &mut burned),
                FireSpreadErrorCode::Ok
            );
            assert_eq!(proportion, 0.0);
            assert!(!burned);
            assert_eq!(
                fire_spread_region_proportion_burned(sim, 3, &mut proportion, ptr::null_mut()),
                FireSpreadErrorCode::InvalidParameter
            );

            fire_spread_destroy(sim);
        }
    }

    #[test]
    fn test_config_json() {
        let mut sim = ptr::null_mut();
        let bad = CString::new(r#"{ "regions": { "update_interval_ticks": 0 } }"#).unwrap();
        assert_eq!(
            unsafe { fire_spread_new_with_config(bad.as_ptr(), &mut sim) },
            FireSpreadErrorCode::InvalidConfig
        );
        assert!(sim.is_null());

        let good = CString::new(r#"{ "seed": 3 }"#).unwrap();
        assert_eq!(
            unsafe { fire_spread_new_with_config(good.as_ptr(), &mut sim) },
            FireSpreadErrorCode::Ok
        );
        unsafe { fire_spread_destroy(sim) };
    }
}

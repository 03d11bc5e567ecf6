#![no_main]

use libfuzzer_sys::fuzz_target;
use syzygy_bridge::{codec, PackedResult};

fuzz_target!(|raw: u32| {
    let packed = PackedResult(raw);
    assert_eq!(codec::decode_dtz(raw), codec::decode_dtz(raw));

    let recomposed = PackedResult::compose(
        packed.wdl_bits(),
        packed.to_bits(),
        packed.from_bits(),
        packed.promotes_bits(),
        packed.dtz_bits(),
    );
    // Bit 19 is not part of any field.
    assert_eq!(recomposed.raw(), raw & !(1 << 19));

    if let Ok(probe) = packed.decode_dtz() {
        assert_eq!(probe.wdl.ordinal(), packed.wdl_bits());
        assert_eq!(u32::from(probe.from), packed.from_bits());
        assert_eq!(u32::from(probe.to), packed.to_bits());
        assert_eq!(probe.dtz, packed.dtz_bits());
    }
});

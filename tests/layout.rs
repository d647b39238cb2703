// Layout conformance tests for the structs shared with the native library.
// They assert sizes, alignments, and field offsets against the C header,
// and print the observed values to help when a platform disagrees.
use memoffset::offset_of;
use std::mem::{align_of, size_of};
use tuningfork_bridge::{CProtobufSerialization, ErrorCode, LifecycleState, LoadingTimeMetadata};

#[test]
fn test_protobuf_serialization_layout() {
    let ptr = size_of::<*mut u8>();
    // pointer, u32 padded to pointer alignment, function pointer
    let expected = ptr * 3;

    let size = size_of::<CProtobufSerialization>();
    let align = align_of::<CProtobufSerialization>();
    let off_bytes = offset_of!(CProtobufSerialization, bytes);
    let off_size = offset_of!(CProtobufSerialization, size);
    let off_dealloc = offset_of!(CProtobufSerialization, dealloc);

    println!(
        "CProtobufSerialization => size: {size}, expected: {expected}, align: {align}, offsets: [bytes:{off_bytes}, size:{off_size}, dealloc:{off_dealloc}]"
    );

    assert_eq!(size, expected);
    assert_eq!(align, align_of::<*mut u8>());
    assert_eq!(off_bytes, 0);
    assert_eq!(off_size, ptr);
    assert_eq!(off_dealloc, ptr * 2);
    // Option<fn> must stay pointer-sized so a null deallocator is plain NULL.
    assert_eq!(size_of::<Option<unsafe extern "C" fn(*mut CProtobufSerialization)>>(), ptr);
}

#[test]
fn test_loading_time_metadata_layout() {
    // four i32-sized fields followed by two u64
    let raw = 4 * 4 + 8 + 8;

    let size = size_of::<LoadingTimeMetadata>();
    let align = align_of::<LoadingTimeMetadata>();
    let off_state = offset_of!(LoadingTimeMetadata, state);
    let off_source = offset_of!(LoadingTimeMetadata, source);
    let off_compression = offset_of!(LoadingTimeMetadata, compression_level);
    let off_connectivity = offset_of!(LoadingTimeMetadata, network_connectivity);
    let off_speed = offset_of!(LoadingTimeMetadata, network_transfer_speed_bps);
    let off_latency = offset_of!(LoadingTimeMetadata, network_latency_ns);

    println!(
        "LoadingTimeMetadata => size: {size}, expected: {raw}, align: {align} (u64 align: {}), offsets: [state:{off_state}, source:{off_source}, compression_level:{off_compression}, network_connectivity:{off_connectivity}, network_transfer_speed_bps:{off_speed}, network_latency_ns:{off_latency}]",
        align_of::<u64>()
    );

    assert_eq!(size, raw);
    assert_eq!(align, align_of::<u64>());
    assert_eq!(off_state, 0);
    assert_eq!(off_source, 4);
    assert_eq!(off_compression, 8);
    assert_eq!(off_connectivity, 12);
    assert_eq!(off_speed, 16);
    assert_eq!(off_latency, 24);
    assert_eq!(LoadingTimeMetadata::wire_size() as usize, size);
}

#[test]
fn test_enums_are_c_int_sized() {
    assert_eq!(size_of::<ErrorCode>(), size_of::<i32>());
    assert_eq!(size_of::<LifecycleState>(), size_of::<i32>());
    assert_eq!(LifecycleState::OnDestroy as i32, 4);
    assert_eq!(ErrorCode::PlatformNotSupported.as_raw(), 27);
}

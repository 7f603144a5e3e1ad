//! Basic conversion example

use bbvh_core::{encoder::ContainerBuilder, extract_document, QuantizationMode};

const WALK_BVH: &str = "HIERARCHY
ROOT Hips
{
\tOFFSET 0.00 0.00 0.00
\tCHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation
\tJOINT LeftUpLeg
\t{
\t\tOFFSET 3.43 0.00 0.00
\t\tCHANNELS 3 Zrotation Xrotation Yrotation
\t\tEnd Site
\t\t{
\t\t\tOFFSET 0.00 -17.00 0.00
\t\t}
\t}
}
MOTION
Frames: 3
Frame Time: 0.033333
0.00 35.20 0.00 -2.10 4.50 0.30 10.00 -5.00 1.20
0.10 35.25 0.40 -2.00 4.40 0.35 12.50 -4.80 1.10
0.20 35.30 0.80 -1.90 4.30 0.40 15.00 -4.60 1.00
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("BBVH Basic Conversion Example\n");

    let doc = extract_document(WALK_BVH);
    println!(
        "Parsed {} joints, {} channels, {} frames @ {}s",
        doc.joint_count, doc.total_channel_count, doc.frame_count, doc.frame_time
    );

    for mode in [
        QuantizationMode::Int16,
        QuantizationMode::Float32,
        QuantizationMode::Int8,
    ] {
        let encoded = ContainerBuilder::new(mode).with_end_marker().encode(&doc)?;
        let layout = &encoded.layout;

        println!(
            "Mode {}: {} bytes (hierarchy @{}, motion @{}, relocation @{})",
            mode.as_u8(),
            encoded.bytes.len(),
            layout.hierarchy_pointer,
            layout.motion_pointer,
            layout.relocation_pointer
        );

        let path = format!("example_output_mode{}.bbvh", mode.as_u8());
        std::fs::write(&path, &encoded.bytes)?;
    }

    println!("\nUse 'bbvh convert --input walk.bvh --output walk.bbvh' for files on disk");

    Ok(())
}

//! A self-contained playback demo: one node animated by a translation
//! channel and a rotation channel, driven off the frame timer for a single
//! pass.
//!
//! Run with `cargo run --example orbit`.

use std::f32::consts::{FRAC_PI_2, PI};
use std::thread::sleep;
use std::time::Duration;

use anyhow::{Result, ensure};
use glam::Quat;
use glint::{
    Accessor, Animation, AnimationChannel, AnimationRegistry, AnimationSampler, Document,
    ElementType, Node, TargetPath, Timer,
};

/// One-slot registry: flips to done when the animation deregisters itself.
struct SingleSlot {
    done: bool,
}

impl AnimationRegistry for SingleSlot {
    fn remove_animation_index(&mut self, _index: usize) {
        self.done = true;
    }
}

fn build_document() -> Result<Document> {
    let mut document = Document::new();

    // Accessor 0: a shared two-second time track.
    document
        .accessors
        .push(Accessor::from_f32(ElementType::Scalar, &[0.0, 1.0, 2.0])?);

    // Accessor 1: slide out along X and back.
    document.accessors.push(Accessor::from_f32(
        ElementType::Vec3,
        &[0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    )?);

    // Accessor 2: a half turn about Y.
    let mut rotation_keys = Vec::new();
    for quat in [
        Quat::IDENTITY,
        Quat::from_rotation_y(FRAC_PI_2),
        Quat::from_rotation_y(PI),
    ] {
        rotation_keys.extend_from_slice(&quat.to_array());
    }
    document
        .accessors
        .push(Accessor::from_f32(ElementType::Vec4, &rotation_keys)?);

    document.nodes.push(Node::new());
    document.capture_rest_pose();
    Ok(document)
}

fn build_animation() -> Animation {
    let mut animation = Animation::new("orbit");
    animation.add_sampler(AnimationSampler::linear(0, 1));
    animation.add_sampler(AnimationSampler::linear(0, 2));

    let mut translation = AnimationChannel::new();
    translation.create_target(0, TargetPath::Translation);
    translation.set_sampler(0);
    animation.add_channel(translation);

    let mut rotation = AnimationChannel::new();
    rotation.create_target(0, TargetPath::Rotation);
    rotation.set_sampler(1);
    animation.add_channel(rotation);

    animation
}

fn main() -> Result<()> {
    env_logger::init();

    let mut document = build_document()?;
    let mut animation = build_animation();
    ensure!(
        animation.validate(&document),
        "animation failed validation"
    );

    println!("{animation}");
    println!(
        "animating nodes {:?}, properties {:?}",
        animation.affected_nodes(),
        animation.animated_properties()
    );

    let mut registry = SingleSlot { done: false };
    let mut timer = Timer::new();

    // One full pass; the animation deregisters itself when it completes.
    while !registry.done {
        timer.tick();
        animation.advance_with_timer(&mut document, &mut registry, &timer, 1, 0);

        let node = document.node(0).expect("node 0 exists");
        println!(
            "t={:5.2}s  translation=({:+.2}, {:+.2}, {:+.2})  rotation=({:+.3}, {:+.3}, {:+.3}, {:+.3})",
            timer.elapsed_seconds(),
            node.translation.x,
            node.translation.y,
            node.translation.z,
            node.rotation.x,
            node.rotation.y,
            node.rotation.z,
            node.rotation.w,
        );
        sleep(Duration::from_millis(100));
    }

    println!("animation finished; the node rests on its final frame");
    Ok(())
}

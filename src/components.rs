use bevy::prelude::*;

/// Index of the body this entity draws, into `BodySet::bodies`.
#[derive(Component, Deref, DerefMut, Clone, Copy)]
pub struct BodyIndex(pub usize);

/// Color used for the body's disc and its trail.
#[derive(Component, Deref, DerefMut, Clone, Copy)]
pub struct BodyColor(pub Color);

//! Game objects and the pixel masks used to collide them.

pub use self::{bird::*, floor::*, mask::*, pipe::*, sprite::*};

pub(crate) mod bird;
pub(crate) mod floor;
pub(crate) mod mask;
pub(crate) mod pipe;
pub(crate) mod sprite;

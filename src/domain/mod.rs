// Domain layer: models and ports. Nothing here touches the filesystem or codecs.

pub mod model;
pub mod ports;

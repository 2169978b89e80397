pub mod cascade_reader;
pub mod cascade_resolver;
pub mod iou_clusterer;
pub mod landmark_cascade_set;
pub mod math;
pub mod pico_cascades;
pub mod pico_face_classifier;
pub mod puploc_cascade;

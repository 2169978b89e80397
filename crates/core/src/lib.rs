pub mod shared {
    pub mod constants;
    pub mod face;
    pub mod pixel_grid;
}

pub mod detection {
    pub mod domain {
        pub mod detection_clusterer;
        pub mod eye_hints;
        pub mod face_detector;
        pub mod landmark_cluster;
        pub mod landmark_finder;
        pub mod point_localizer;
        pub mod region_classifier;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod detect_faces_use_case;
}

pub mod download {
    pub mod domain {
        pub mod downloader;
    }
    pub mod infrastructure;
}

pub mod cache {
    pub mod domain {
        pub mod cache_store;
    }
    pub mod infrastructure;
}

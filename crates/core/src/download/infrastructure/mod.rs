pub mod http_downloader;

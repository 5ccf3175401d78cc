mod frame;
mod xcap_backend;

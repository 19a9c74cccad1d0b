pub mod work_session;

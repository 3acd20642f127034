pub mod leaderboard;
pub mod scoring;

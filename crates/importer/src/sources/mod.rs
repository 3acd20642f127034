pub mod codeforces;

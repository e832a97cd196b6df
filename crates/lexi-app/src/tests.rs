mod progress_channel_tests;

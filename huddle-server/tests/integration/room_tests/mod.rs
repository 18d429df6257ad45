mod test_concurrent_nickname_race;

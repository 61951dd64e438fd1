mod fighters;
